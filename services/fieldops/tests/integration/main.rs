mod helpers;

mod application_test;
mod user_test;
