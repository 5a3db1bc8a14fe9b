//! Catalog fixtures shared by the unit tests of the query engine.

use serde_json::json;

use crate::model::{CatalogDefinition, MissionDatabase};

fn build(value: serde_json::Value) -> MissionDatabase {
    let definition: CatalogDefinition = serde_json::from_value(value).unwrap();
    MissionDatabase::build(definition).unwrap()
}

/// `/sys1/P1`, `/sys1/sub/P2`, `/sys2/P3`.
pub fn three_parameters() -> MissionDatabase {
    build(json!({
        "name": "three",
        "spaceSystems": [
            {
                "name": "sys1",
                "parameters": [{"name": "P1"}],
                "spaceSystems": [{"name": "sub", "parameters": [{"name": "P2"}]}]
            },
            {"name": "sys2", "parameters": [{"name": "P3"}]}
        ]
    }))
}

/// A catalog exercising every entity kind, aggregate types, legacy
/// aliases and a space system without members.
pub fn rich_catalog() -> MissionDatabase {
    build(json!({
        "name": "rich",
        "version": "1.2",
        "spaceSystems": [
            {
                "name": "sys1",
                "description": "First subsystem",
                "parameterTypes": [
                    {"name": "float_t", "units": "V", "type": {"engType": "float"}},
                    {"name": "vector_t", "type": {"engType": "aggregate", "members": [
                        {"name": "x", "type": {"engType": "float"}},
                        {"name": "y", "type": {"engType": "float"}},
                        {"name": "samples", "type": {"engType": "array", "dimensions": 1, "element":
                            {"engType": "aggregate", "members": [
                                {"name": "value", "type": {"engType": "integer"}}
                            ]}
                        }}
                    ]}}
                ],
                "parameters": [
                    {"name": "P1", "type": "float_t", "dataSource": "TELEMETERED",
                     "description": "Battery voltage"},
                    {"name": "Vec", "type": "vector_t", "dataSource": "DERIVED",
                     "aliases": [{"namespace": "a/b", "name": "L1"}]}
                ],
                "containers": [
                    {"name": "pkt", "entries": [{"parameter": "P1"}, {"parameter": "Vec"}]}
                ],
                "commands": [
                    {"name": "base", "abstract": true},
                    {"name": "SWITCH_ON", "baseCommand": "base", "description": "Switch the battery on"}
                ],
                "algorithms": [
                    {"name": "calib", "scope": "GLOBAL", "inputParameters": ["P1"], "outputParameters": ["Vec"]}
                ],
                "spaceSystems": [
                    {
                        "name": "sub",
                        "parameters": [{"name": "P2", "type": "/sys1/float_t", "dataSource": "TELEMETERED"}],
                        "containers": [{"name": "sub_pkt", "entries": [{"parameter": "P2"}]}]
                    },
                    {"name": "empty"}
                ]
            },
            {
                "name": "sys2",
                "parameters": [
                    {"name": "P3", "type": "/sys1/float_t", "dataSource": "CONSTANT",
                     "aliases": [{"namespace": "MDB:OPS Name", "name": "OPS_P3"}]}
                ],
                "commands": [{"name": "RESET"}],
                "algorithms": [{"name": "verify", "scope": "COMMAND_VERIFICATION"}]
            }
        ]
    }))
}
