/// CSV export of the request log.
pub mod export;
