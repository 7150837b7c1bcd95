#![allow(dead_code)]

pub mod monster;
