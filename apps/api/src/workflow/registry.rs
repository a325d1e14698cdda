//! In-memory plan registry, owned by the orchestrator.
//!
//! One lock guards the id → entry map. Each entry carries its own state lock
//! (held only while reading or applying a transition) and a run lock held for
//! the whole execution, so a plan is never executed by two callers at once.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::workflow::models::WorkflowPlan;
use crate::workflow::results::ExecutionSummary;

pub struct PlanSlot {
    pub plan: WorkflowPlan,
    /// Set once the plan reaches a terminal status; returned verbatim afterwards.
    pub summary: Option<ExecutionSummary>,
}

pub struct PlanEntry {
    pub state: RwLock<PlanSlot>,
    pub run_lock: Mutex<()>,
}

#[derive(Default)]
pub struct PlanRegistry {
    plans: RwLock<HashMap<String, Arc<PlanEntry>>>,
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, plan: WorkflowPlan) -> Arc<PlanEntry> {
        let id = plan.id.clone();
        let entry = Arc::new(PlanEntry {
            state: RwLock::new(PlanSlot {
                plan,
                summary: None,
            }),
            run_lock: Mutex::new(()),
        });
        self.plans.write().await.insert(id, entry.clone());
        entry
    }

    pub async fn get(&self, plan_id: &str) -> Option<Arc<PlanEntry>> {
        self.plans.read().await.get(plan_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.plans.read().await.len()
    }
}
