use crate::wire::{HealthRes, ModelsHealthRes};
use dx_core::ModelHealth;

/// Health reporting shared by the REST API and the CLI.
///
/// Turns the core's per-slot model status into the wire response. The service itself is
/// reported as alive whenever it can answer; `ok` is true only when both model slots respond.
pub struct HealthService;

impl HealthService {
    /// Build the health response for the given model status, stamped with the current time.
    pub fn check_health(models: ModelHealth) -> HealthRes {
        let ok = models.all_connected();
        let message = if ok {
            "DX is alive; both model slots are reachable".to_string()
        } else {
            "DX is alive; running in demo fallback for unreachable model slots".to_string()
        };

        HealthRes {
            ok,
            message,
            checked_at: chrono::Utc::now().to_rfc3339(),
            models: ModelsHealthRes {
                reasoning: models.reasoning.into(),
                chat: models.chat.into(),
            },
        }
    }
}
