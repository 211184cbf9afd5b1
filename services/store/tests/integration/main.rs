mod helpers;

mod cleanup_test;
mod order_lifecycle_test;
