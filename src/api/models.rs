use serde::{Deserialize, Serialize};

/// Account role as the backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Provider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Provider => "provider",
            Role::Admin => "admin",
        }
    }
}

/// The authenticated identity returned by login/register and persisted locally.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Session {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub service: String,
    pub phone: String,
    pub address: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
}

/// Payload for creating a shop. The server assigns the id.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewShop {
    pub owner_id: i64,
    pub name: String,
    pub service: String,
    pub phone: String,
    pub address: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
}

/// Write-only request record; the client never reads these back.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub provider_id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_lowercase() {
        for (role, wire) in [
            (Role::User, "\"user\""),
            (Role::Provider, "\"provider\""),
            (Role::Admin, "\"admin\""),
        ] {
            assert_eq!(serde_json::to_string(&role).unwrap(), wire);
            assert_eq!(serde_json::from_str::<Role>(wire).unwrap(), role);
        }
    }

    #[test]
    fn shop_parses_camel_case_wire_fields() {
        let shop: Shop = serde_json::from_str(
            r#"{"id":5,"ownerId":2,"name":"Fix-It","service":"Plumbing",
                "phone":"0300-1234567","address":"12 Canal Rd","description":"Taps and pipes",
                "lat":31.52,"lng":74.35}"#,
        )
        .unwrap();
        assert_eq!(shop.owner_id, 2);
        assert_eq!(shop.service, "Plumbing");
    }

    #[test]
    fn service_request_serializes_provider_id_camel_case() {
        let req = ServiceRequest {
            provider_id: 9,
            name: "bob".into(),
            phone: "000-0000".into(),
            address: "somewhere".into(),
            lat: 31.488,
            lng: 74.343,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["providerId"], 9);
        assert!(json.get("provider_id").is_none());
    }
}
