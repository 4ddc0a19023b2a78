pub mod call;
pub mod methods;
pub mod providers;
