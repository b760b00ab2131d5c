use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tank {
    pub id: String,
    pub name: String,
    pub species: String,
    pub volume_gallons: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub water_changes: Vec<WaterChange>,
    #[serde(default)]
    pub feedings: Vec<Feeding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub param_type: String,
    pub value: f64,
    pub unit: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterChange {
    pub id: String,
    pub date: DateTime<Utc>,
    pub volume_gallons: f64,
    #[serde(default)]
    pub notes: String,
}

/// Not rendered anywhere yet, but carried so a fetched tank round-trips intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feeding {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub food_type: String,
    pub amount: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTank {
    pub name: String,
    pub species: String,
    pub volume_gallons: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParameter {
    pub param_type: String,
    pub value: f64,
    pub unit: String,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
    pub tank_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWaterChange {
    pub volume_gallons: f64,
    pub notes: String,
    pub date: DateTime<Utc>,
    pub tank_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tank_decodes_camel_case_with_nested_records() {
        let json = serde_json::json!({
            "id": "t1",
            "name": "Reef",
            "species": "Clownfish",
            "volumeGallons": 40.0,
            "notes": "lights on timer",
            "parameters": [{
                "id": "p1",
                "timestamp": "2026-03-01T10:00:00.000Z",
                "paramType": "PH",
                "value": 8.1,
                "unit": "pH",
                "notes": ""
            }],
            "waterChanges": [{
                "id": "w1",
                "date": "2026-03-02T09:30:00+02:00",
                "volumeGallons": 10,
                "notes": "25%"
            }],
            "feedings": []
        });

        let tank: Tank = serde_json::from_value(json).unwrap();
        assert_eq!(tank.volume_gallons, 40.0);
        assert_eq!(tank.parameters[0].param_type, "PH");
        assert_eq!(
            tank.water_changes[0].date.to_rfc3339(),
            "2026-03-02T07:30:00+00:00"
        );
    }

    #[test]
    fn freshly_created_tank_defaults_missing_collections() {
        let json = serde_json::json!({
            "id": "t9",
            "name": "Nano",
            "species": "Shrimp",
            "volumeGallons": 5
        });

        let tank: Tank = serde_json::from_value(json).unwrap();
        assert!(tank.notes.is_empty());
        assert!(tank.parameters.is_empty());
        assert!(tank.water_changes.is_empty());
        assert!(tank.feedings.is_empty());
    }

    #[test]
    fn new_parameter_encodes_wire_names() {
        let request = NewParameter {
            param_type: "PH".into(),
            value: 7.2,
            unit: "pH".into(),
            notes: String::new(),
            timestamp: "2026-03-01T10:00:00Z".parse().unwrap(),
            tank_id: "t1".into(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["paramType"], "PH");
        assert_eq!(value["tankId"], "t1");
        assert_eq!(value["value"], 7.2);
        assert!(value["timestamp"].as_str().unwrap().starts_with("2026-03-01T10:00:00"));
    }
}
