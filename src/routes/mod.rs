mod health_check;
mod subscription_status;
mod subscriptions;

pub use health_check::health_check;
pub use subscription_status::subscription_status;
pub use subscriptions::subscribe;
