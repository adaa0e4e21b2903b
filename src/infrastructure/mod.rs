pub mod json_file_user_repository;
