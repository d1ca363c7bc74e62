//! Reading facility location problems from files and driving the greedy from the command line.

pub mod io;
