use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugKind {
    Series,
    Chapter,
}

impl SlugKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlugKind::Series => "series",
            SlugKind::Chapter => "chapter",
        }
    }
}

impl fmt::Display for SlugKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlugKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "series" => Ok(SlugKind::Series),
            "chapter" => Ok(SlugKind::Chapter),
            other => Err(format!("unknown slug type {other}")),
        }
    }
}

/// Body of `POST /api/get-id`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IdRequest {
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: SlugKind,
}

/// Response of `POST /api/get-id`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IdResponse {
    pub uuid: String,
}

/// Response of `GET /api/get-slug/{uuid}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlugMapping {
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: SlugKind,
}
