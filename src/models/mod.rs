pub mod token;
pub mod verdict;
mod social;

pub use token::BuySignal;
pub use token::TokenRecord;
pub use social::SentimentSample;
pub use social::SocialReport;
pub use verdict::ReputationVerdict;
pub use verdict::SecurityVerdict;
pub use verdict::Verdict;
