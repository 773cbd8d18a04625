pub mod controllers;
pub mod install;
