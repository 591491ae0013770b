mod auth_test;
mod clients_test;
mod health_test;
mod me_test;
mod tickets_test;
