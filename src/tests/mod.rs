mod collections;
mod invalid_json;
mod ownership;
