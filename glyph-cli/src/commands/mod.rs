pub mod login;
pub mod logout;
pub mod oauth;
pub mod register;
pub mod signals;
pub mod status;
