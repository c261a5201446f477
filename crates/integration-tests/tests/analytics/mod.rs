mod auth;
mod caching;
mod pagination;
