mod outcome;
mod provider_config;
mod subscriber_email;

pub use outcome::{
    ErrorCategory, SubscriptionFailure, SubscriptionOutcome, INVALID_EMAIL_MESSAGE,
    RETRY_LATER_MESSAGE, SUBMITTED_MESSAGE, SUBSCRIBED_MESSAGE,
};
pub use provider_config::{
    derive_fallback_url, ConfigurationError, DeliveryMode, NewsletterProvider, ProviderConfig,
};
pub use subscriber_email::{InvalidSubscriberEmail, SubscriberEmail};
