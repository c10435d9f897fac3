mod expire_listings;

pub use expire_listings::ExpireListingsTask;
