//! # objscope - In-Process Object Graph Probe
//!
//! objscope is a shared library preloaded into an application built on a
//! Qt-style object toolkit. It keeps a live model of the application's objects,
//! their ownership tree and their signal/slot connections, without changes to
//! the application itself.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Toolkit Runtime (host)                      │
//! │   qt_startup_hook / qt_addObject / qt_removeObject lookups      │
//! │   connect/disconnect callbacks · child events · event loop      │
//! └───────────────┬───────────────────────────────┬─────────────────┘
//!                 │ hook calls                    │ callbacks
//!                 ▼                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  objscope (This Crate)                          │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │  Interpose   │──▶│    Probe     │──▶│    Models    │         │
//! │  │ hooks+chain  │   │ phase+buffer │   │ obj/tree/conn│         │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘         │
//! │         ▲                  │                  │                 │
//! │         │                  ▼                  ▼                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │  Host Bridge │◀──│ delayed init │   │    Export    │         │
//! │  │  (adapter)   │   │ presentation │   │ (snapshot)   │         │
//! │  └──────────────┘   └──────────────┘   └──────────────┘         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`interpose`]: exported hook symbols, next-in-chain resolution, the C
//!   callbacks and the adapter-backed [`probe::Host`]
//! - [`probe`]: the [`probe::Probe`] context object, its phase machine, the
//!   pending buffer and the latched global slot
//! - [`models`]: object registry, hierarchy tracker, connection registry
//! - [`export`]: JSON snapshots of the models
//! - [`domain`]: identities, descriptors, typed events and errors
//! - [`config`] / [`logging`]: environment-driven configuration and logger setup
//! - [`cli`]: the `objscope` snapshot inspector
//!
//! ## Lifecycle
//!
//! 1. The first hook call constructs the probe. Objects seen from then on are
//!    buffered.
//! 2. `qt_startup_hook` installs the child-event observer and queues delayed
//!    init on the toolkit's event loop.
//! 3. Delayed init replays the buffer into the models, switches to live
//!    dispatch and launches the presentation surface.
//!
//! ## Typical Usage
//!
//! ```bash
//! # Preload the probe and the toolkit adapter into an application
//! LD_PRELOAD=libobjscope.so:libobjscope_adapter.so ./my-app
//!
//! # Inspect a snapshot written through objscope_export_snapshot()
//! objscope /tmp/my-app.objscope.json --tree --connections
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod interpose;
pub mod logging;
pub mod models;
pub mod probe;
