pub(crate) mod forecast;
pub(crate) mod health;
pub(crate) mod predictions;
pub(crate) mod prices;
