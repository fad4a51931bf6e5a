pub mod db_utils;
pub mod forms;
pub mod sanitize;
pub mod uploads;
