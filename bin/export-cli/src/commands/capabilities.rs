// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `export-onnx capabilities`

use super::banner;
use export_pipeline::{Capabilities, CapabilityReport};

pub fn execute() -> anyhow::Result<()> {
    banner("capabilities");

    println!("  Compiled in:");
    for name in Capabilities::compiled() {
        println!("    ✓ {name}");
    }
    println!();

    match Capabilities::probe() {
        CapabilityReport::Available(backend) => {
            println!("  Validation backend: {}", backend.name());
        }
        CapabilityReport::Missing(missing) => {
            println!("  Missing:");
            for capability in missing {
                println!("    ✗ {}: {}", capability.name, capability.hint);
            }
        }
    }
    Ok(())
}
