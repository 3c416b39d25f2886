pub mod fs_size_calculator;
pub mod init_test_environment;
pub mod traits;
