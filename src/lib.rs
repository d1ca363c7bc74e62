use lazy_static::lazy_static;

pub mod prelude;

pub mod assignment;
pub mod costs;
pub mod effectiveness;
pub mod error;
pub mod greedy;
pub mod instance;
pub mod ranked;

lazy_static! {
    static ref LOG: u64 = init_log();
}

#[allow(unused)]
// install a logger facility
fn init_log() -> u64 {
    let _res = env_logger::try_init();
    log::info!("logger initialized");
    1
}

#[cfg(test)]
mod tests {
    #[test]
    // initialize once log system for tests.
    fn init_log() {
        let _res = env_logger::try_init();
        assert_eq!(*super::LOG, 1);
    }
} // end of tests
