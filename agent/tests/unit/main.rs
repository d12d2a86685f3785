//! Unit test suite

mod stub;
mod test_charge_limit;
mod test_poller;
mod test_run;
