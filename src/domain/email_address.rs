use validator::ValidateEmail;

#[derive(Debug, Clone)]
/// This struct exists only for email parsing and can be used for both senders
/// and recipients.
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(email: String) -> Result<Self, String> {
        ValidateEmail::validate_email(&email)
            // https://stackoverflow.com/a/65012849
            .then_some(Self(email.clone()))
            .ok_or(format!("Invalid email: {email:?}"))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
