//! Embedded block tests

mod custom_models;
mod images;
