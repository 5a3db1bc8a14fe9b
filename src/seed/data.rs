use anyhow::{Context, Result};
use serde_json::json;

use crate::model::{CatalogDefinition, MissionDatabase};
use crate::store::MemoryStore;

/// Instance name under which the demonstration catalog is served.
pub const SIMULATOR_INSTANCE: &str = "simulator";

/// Definition of a small spacecraft simulator catalog. `/YSS/SIMULATOR`
/// holds power, attitude and mode telemetry, `/YSS/SIMULATOR/DHS` the
/// data handling subsystem, and `/YSS/SIMULATOR/PAYLOAD` is declared but
/// still empty.
pub fn simulator_definition() -> serde_json::Value {
    json!({
        "name": "YSS simulator",
        "version": "1.3",
        "spaceSystems": [{
            "name": "YSS",
            "description": "Yamcs simulated spacecraft",
            "spaceSystems": [{
                "name": "SIMULATOR",
                "description": "Spacecraft simulator",
                "version": "1.3",
                "parameterTypes": [
                    {"name": "voltage_t", "units": "V",
                     "type": {"engType": "float", "sizeInBits": 32}},
                    {"name": "temperature_t", "units": "degC",
                     "type": {"engType": "float", "sizeInBits": 32}},
                    {"name": "mode_t", "type": {"engType": "enumeration", "values": [
                        {"value": 0, "label": "SAFE"},
                        {"value": 1, "label": "NOMINAL"},
                        {"value": 2, "label": "SCIENCE"}
                    ]}},
                    {"name": "position_t", "description": "Position in the orbital frame",
                     "type": {"engType": "aggregate", "members": [
                        {"name": "latitude", "type": {"engType": "float", "sizeInBits": 64}},
                        {"name": "longitude", "type": {"engType": "float", "sizeInBits": 64}},
                        {"name": "altitude", "type": {"engType": "float", "sizeInBits": 64}}
                     ]}},
                    {"name": "battery_history_t",
                     "type": {"engType": "array", "dimensions": 1, "element":
                        {"engType": "aggregate", "members": [
                            {"name": "voltage", "type": {"engType": "float"}},
                            {"name": "temperature", "type": {"engType": "float"}}
                        ]}}}
                ],
                "parameters": [
                    {"name": "BatteryVoltage1", "type": "voltage_t", "dataSource": "TELEMETERED",
                     "description": "Voltage of battery 1",
                     "aliases": [{"namespace": "MDB:OPS Name", "name": "SIMULATOR_BatteryVoltage1"}]},
                    {"name": "BatteryVoltage2", "type": "voltage_t", "dataSource": "TELEMETERED",
                     "description": "Voltage of battery 2",
                     "aliases": [{"namespace": "MDB:OPS Name", "name": "SIMULATOR_BatteryVoltage2"}]},
                    {"name": "BatteryTemperature1", "type": "temperature_t", "dataSource": "TELEMETERED",
                     "description": "Temperature of battery 1"},
                    {"name": "BatteryHistory", "type": "battery_history_t", "dataSource": "DERIVED",
                     "description": "Last battery samples"},
                    {"name": "Position", "type": "position_t", "dataSource": "TELEMETERED",
                     "aliases": [{"namespace": "MDB:OPS Name", "name": "SIMULATOR_Position"}]},
                    {"name": "Mode", "type": "mode_t", "dataSource": "TELEMETERED",
                     "description": "Spacecraft operating mode"},
                    {"name": "VoltageLimit", "type": "voltage_t", "dataSource": "CONSTANT",
                     "description": "Minimum allowed battery voltage"},
                    {"name": "AverageVoltage", "type": "voltage_t", "dataSource": "DERIVED",
                     "description": "Mean voltage of both batteries"}
                ],
                "containers": [
                    {"name": "Telemetry", "description": "Top-level telemetry packet",
                     "archivePartition": true,
                     "entries": [{"container": "Power"}, {"container": "Attitude"}, {"parameter": "Mode"}]},
                    {"name": "Power", "baseContainer": "Telemetry", "sizeInBits": 96,
                     "entries": [{"parameter": "BatteryVoltage1"}, {"parameter": "BatteryVoltage2"},
                                 {"parameter": "BatteryTemperature1"}]},
                    {"name": "Attitude", "baseContainer": "Telemetry",
                     "entries": [{"parameter": "Position"}]}
                ],
                "commands": [
                    {"name": "SIM_TC", "abstract": true, "description": "Base of simulator commands"},
                    {"name": "SWITCH_VOLTAGE_ON", "baseCommand": "SIM_TC",
                     "description": "Switch a battery on", "significance": "critical",
                     "arguments": [{"name": "voltage_num", "type": "uint8", "initialValue": "1"}]},
                    {"name": "SWITCH_VOLTAGE_OFF", "baseCommand": "SIM_TC",
                     "description": "Switch a battery off",
                     "arguments": [{"name": "voltage_num", "type": "uint8"}]},
                    {"name": "SET_MODE", "baseCommand": "SIM_TC",
                     "arguments": [{"name": "mode", "type": "mode_t"}]}
                ],
                "algorithms": [
                    {"name": "AverageVoltageAlgorithm", "language": "java-expression",
                     "text": "out0.setFloatValue((in0.getEngValue().getFloatValue() + in1.getEngValue().getFloatValue()) / 2);",
                     "inputParameters": ["BatteryVoltage1", "BatteryVoltage2"],
                     "outputParameters": ["AverageVoltage"]},
                    {"name": "VoltageVerifier", "scope": "COMMAND_VERIFICATION",
                     "description": "Checks the commanded battery reports voltage",
                     "inputParameters": ["BatteryVoltage1"]}
                ],
                "spaceSystems": [
                    {
                        "name": "DHS",
                        "description": "Data handling subsystem",
                        "parameterTypes": [
                            {"name": "counter_t", "type": {"engType": "integer", "signed": false, "sizeInBits": 16}}
                        ],
                        "parameters": [
                            {"name": "PacketCounter", "type": "counter_t", "dataSource": "TELEMETERED"},
                            {"name": "OnboardTime", "dataSource": "TELEMETERED"}
                        ],
                        "containers": [
                            {"name": "Housekeeping", "entries": [{"parameter": "PacketCounter"}]}
                        ],
                        "commands": [
                            {"name": "RESET_COUNTER", "baseCommand": "/YSS/SIMULATOR/SIM_TC"}
                        ]
                    },
                    {"name": "PAYLOAD", "description": "Payload subsystem"}
                ]
            }]
        }]
    })
}

pub fn simulator_catalog() -> Result<MissionDatabase> {
    let definition: CatalogDefinition = serde_json::from_value(simulator_definition())
        .context("invalid simulator catalog definition")?;
    MissionDatabase::build(definition)
}

/// Serve the simulator catalog from `store`.
pub fn load_seed_data(store: &MemoryStore) -> Result<()> {
    let mdb = simulator_catalog()?;
    log::info!(
        "Loaded seed catalog '{}' as instance {}",
        mdb.name(),
        SIMULATOR_INSTANCE
    );
    store.insert(SIMULATOR_INSTANCE, mdb);
    Ok(())
}
