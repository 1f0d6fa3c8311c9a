//! # Módulo Dashboard — Controlador de Estágios
//!
//! Converte o fluxo de eventos do pipeline em estado de tela.
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`view`] | `ViewState` e view models (estágios, notas, log, modal) |
//! | [`render`] | Trait `RenderPort` — a fronteira com o DOM |
//! | [`idle`] | Timer de ociosidade com semântica de debounce |
//! | [`controller`] | `DashboardController` — transições de estado |
//! | [`session`] | Task por aba do navegador + registro de sessões |

pub mod controller;
pub mod idle;
pub mod render;
pub mod session;
pub mod view;

pub use render::RenderPort;
pub use session::{spawn_session, Command, SessionConfig, SessionError, SessionRegistry};
