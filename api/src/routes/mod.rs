pub mod ask;
pub mod documents;
pub mod health_route;
pub mod session;
pub mod voice;

#[cfg(test)]
pub(crate) mod test_support;
