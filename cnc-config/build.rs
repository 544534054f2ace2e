/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

/// Build script – compiles protobuf definitions into Rust source code.
///
/// tonic-build wraps prost-build and additionally generates tonic server/client
/// stubs.  The generated files are written to `OUT_DIR` (managed by Cargo) and
/// pulled into the crate via `tonic::include_proto!` in `src/proto/mod.rs`.
///
/// Prerequisites
/// -------------
/// `protoc` (the protobuf compiler) must be available on `$PATH`, or its path
/// must be set in the `PROTOC` environment variable before running `cargo build`.
/// Install on Ubuntu/Debian: `sudo apt install -y protobuf-compiler`
/// Install on macOS:          `brew install protobuf`

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_root = "proto";
    let proto_file = format!("{}/configservice.proto", proto_root);

    // Tell Cargo to re-run this build script when the proto file changes
    println!("cargo:rerun-if-changed={}", proto_file);

    // If `protoc` is not already supplied via PATH or the PROTOC env var, fall
    // back to the vendored binary so the build works in offline environments.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(protoc) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", protoc);
        }
    }

    tonic_build::configure()
        // The service only exposes a server; no client stubs are consumed
        // inside this crate.
        .build_server(true)
        .build_client(false)
        .compile_protos(
            &[proto_file.as_str()], // proto files to compile
            &[proto_root],          // directories to search for imports
        )?;

    Ok(())
}
