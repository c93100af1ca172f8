/************************************************************
 **************The Block File Transfer Protocol**************
 ************************************************************
 ******one command per control connection, 4096 bytes********
 ******per block, and the server dials you back on your******
 ********************announced data port*********************
 ***********************************************************/

pub mod cmd;
pub mod error;
pub mod block;
pub mod network;
pub mod files;
pub mod transfer;
pub mod protocol;
pub mod client;

pub use error::{Error, Result};
