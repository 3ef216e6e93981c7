pub mod passport_controller;
