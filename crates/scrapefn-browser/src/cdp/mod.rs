//! Chrome DevTools Protocol plumbing.
//!
//! A deliberately small CDP surface: one WebSocket connection, one page
//! target, request/response matching by id. Events are not subscribed to;
//! load state is polled (see [`CdpPage::wait_for_load`]).

mod client;
mod error;
mod page;
mod protocol;

pub use client::CdpClient;
pub use error::CdpError;
pub use page::CdpPage;
pub use protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo};
