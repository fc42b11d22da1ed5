use komik_lib::models::CloudUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityView {
    pub name: String,
    pub avatar: Option<String>,
    pub signed_in: bool,
    pub status: &'static str,
    pub login_url: Option<String>,
}

impl IdentityView {
    pub fn new(user: Option<&CloudUser>, login_url: Option<String>) -> Self {
        match user {
            Some(user) => Self {
                name: user.display_name().to_string(),
                avatar: user.user_metadata.avatar_url.clone(),
                signed_in: true,
                status: "Cloud Sync Active",
                login_url: None,
            },
            None => Self {
                name: "Guest".to_string(),
                avatar: None,
                signed_in: false,
                status: "Local Storage mode",
                login_url,
            },
        }
    }
}
