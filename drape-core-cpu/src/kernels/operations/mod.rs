pub mod gather;
