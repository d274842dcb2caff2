mod display_name;
mod email_address;

// allow external `use` statements to skip the submodule names
pub use display_name::DisplayName;
pub use email_address::EmailAddress;
