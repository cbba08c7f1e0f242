pub mod create_env_file;
pub mod init_custom_origin;
pub mod init_project;
