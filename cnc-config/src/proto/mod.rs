/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

/// Proto-generated modules.
///
/// `tonic::include_proto!` expands to an `include!` of the file that
/// prost/tonic-build wrote into `OUT_DIR` during the build script.
pub mod cncconfig_v1 {
    // Package name declared in configservice.proto is `cncconfig.v1`.
    // tonic-build turns the dots into underscores for the file name, so the
    // generated file is `cncconfig.v1.rs` → referenced as "cncconfig.v1".
    tonic::include_proto!("cncconfig.v1");
}
