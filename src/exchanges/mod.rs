pub mod qtrade;
