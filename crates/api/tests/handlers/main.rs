mod availability_test;
mod health_test;
mod middleware_test;
mod reservations_test;
mod test_utils;
mod time_slots_test;
