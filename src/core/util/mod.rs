pub mod iso_time;
