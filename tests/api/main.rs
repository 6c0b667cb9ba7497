mod costs;
mod health_check;
mod helpers;
