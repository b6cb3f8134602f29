mod convert;
mod format;

pub use convert::handle_from_social_link;
pub use format::format_mint;
