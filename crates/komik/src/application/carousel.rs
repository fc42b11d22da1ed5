use std::time::Duration;

use futures::future::{abortable, AbortHandle};

/// Hero slideshow timer. Calls `on_tick` with the next slide index every
/// interval until stopped or dropped.
pub struct Carousel {
    handle: AbortHandle,
}

impl Carousel {
    pub fn start<F>(slides: usize, interval: Duration, on_tick: F) -> Self
    where
        F: Fn(usize) + Send + 'static,
    {
        let (fut, handle) = abortable(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            let mut index = 0;
            loop {
                ticker.tick().await;
                index = (index + 1) % slides.max(1);
                on_tick(index);
            }
        });

        tokio::spawn(async move {
            if fut.await.is_err() {
                debug!("carousel stopped");
            }
        });

        Self { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_aborted()
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_stopped() {
        let ticks = Arc::new(Mutex::new(vec![]));
        let recorded = ticks.clone();

        let carousel = Carousel::start(3, Duration::from_secs(5), move |index| {
            recorded.lock().unwrap().push(index);
        });

        tokio::time::sleep(Duration::from_millis(16_500)).await;
        assert_eq!(*ticks.lock().unwrap(), vec![1, 2, 0]);

        carousel.stop();
        assert!(carousel.is_stopped());
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(ticks.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops() {
        let ticks = Arc::new(Mutex::new(0));
        let recorded = ticks.clone();

        let carousel = Carousel::start(2, Duration::from_secs(1), move |_| {
            *recorded.lock().unwrap() += 1;
        });
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        drop(carousel);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(*ticks.lock().unwrap(), 1);
    }
}
