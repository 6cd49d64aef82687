mod encryption_test;
mod persistence_test;
