//! HAL-style hypermedia wrappers for car responses.
//!
//! A single car renders as the car's own fields plus `_links.self` and
//! `_links.cars`. The collection nests resources under `_embedded.carList`
//! and is omitted entirely when there are no cars.

use axum::http::{header, HeaderMap};
use models::Car;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub cars: Link,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarResource {
    #[serde(flatten)]
    pub car: Car,
    #[serde(rename = "_links")]
    pub links: CarLinks,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedCars {
    pub car_list: Vec<CarResource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarCollection {
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<EmbeddedCars>,
    #[serde(rename = "_links")]
    pub links: CollectionLinks,
}

/// Builds links against a fixed base such as `https://cars.example.com`.
#[derive(Debug, Clone, Default)]
pub struct CarResourceAssembler {
    base: String,
}

impl CarResourceAssembler {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into().trim_end_matches('/').to_string() }
    }

    /// Configured public URL first, then `http://{Host}`, then relative links.
    pub fn for_request(public_url: Option<&str>, headers: &HeaderMap) -> Self {
        if let Some(url) = public_url {
            return Self::new(url);
        }
        match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
            Some(host) if !host.is_empty() => Self::new(format!("http://{host}")),
            _ => Self::default(),
        }
    }

    pub fn collection_href(&self) -> String {
        format!("{}/cars", self.base)
    }

    pub fn self_href(&self, id: i64) -> String {
        format!("{}/cars/{}", self.base, id)
    }

    pub fn to_resource(&self, car: Car) -> CarResource {
        let self_href = car.id.map(|id| self.self_href(id)).unwrap_or_else(|| self.collection_href());
        CarResource {
            car,
            links: CarLinks { self_link: Link { href: self_href }, cars: Link { href: self.collection_href() } },
        }
    }

    pub fn to_collection(&self, cars: Vec<Car>) -> CarCollection {
        let embedded = if cars.is_empty() {
            None
        } else {
            Some(EmbeddedCars { car_list: cars.into_iter().map(|c| self.to_resource(c)).collect() })
        };
        CarCollection { embedded, links: CollectionLinks { self_link: Link { href: self.collection_href() } } }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use models::{Condition, Details, Location};

    fn saved(id: i64) -> Car {
        let mut car = Car::new(Condition::Used, Details::default(), Location::new(40.7, -73.9));
        car.id = Some(id);
        car
    }

    #[test]
    fn public_url_wins_over_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:8080"));
        let a = CarResourceAssembler::for_request(Some("https://cars.example.com/"), &headers);
        assert_eq!(a.self_href(3), "https://cars.example.com/cars/3");
    }

    #[test]
    fn host_header_then_relative() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:8080"));
        assert_eq!(CarResourceAssembler::for_request(None, &headers).collection_href(), "http://localhost:8080/cars");
        assert_eq!(CarResourceAssembler::for_request(None, &HeaderMap::new()).collection_href(), "/cars");
    }

    #[test]
    fn resource_flattens_car_and_adds_links() {
        let json = serde_json::to_value(CarResourceAssembler::new("http://h").to_resource(saved(1))).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["condition"], "USED");
        assert_eq!(json["location"]["lat"], 40.7);
        assert_eq!(json["_links"]["self"]["href"], "http://h/cars/1");
        assert_eq!(json["_links"]["cars"]["href"], "http://h/cars");
    }

    #[test]
    fn collection_embeds_car_list() {
        let a = CarResourceAssembler::new("http://h");
        let json = serde_json::to_value(a.to_collection(vec![saved(1), saved(2)])).unwrap();
        assert_eq!(json["_embedded"]["carList"].as_array().unwrap().len(), 2);
        assert_eq!(json["_embedded"]["carList"][1]["_links"]["self"]["href"], "http://h/cars/2");
        assert_eq!(json["_links"]["self"]["href"], "http://h/cars");

        let empty = serde_json::to_value(a.to_collection(Vec::new())).unwrap();
        assert!(empty.get("_embedded").is_none());
    }
}
