mod common;

mod composer;
mod market;
mod workforce;
