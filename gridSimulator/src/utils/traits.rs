// Capability interface shared by every generation technology

use crate::models::plant::PlantCore;
use crate::resources::state::ResourceSample;

pub trait Dispatch {
    fn core(&self) -> &PlantCore;
    fn core_mut(&mut self) -> &mut PlantCore;

    fn stage_up(&mut self) {
        self.core_mut().stage_up();
    }

    fn stage_down(&mut self) {
        self.core_mut().stage_down();
    }

    /// Finalizes the staged output for the round and returns the dispatched GW
    fn commit(&mut self) -> u32 {
        self.core_mut().commit()
    }

    /// Sets staged output from a resource sample. Returns the unrounded GW for
    /// variable-output technologies and None for dispatchable ones.
    fn produce(&mut self, _sample: &ResourceSample) -> Option<f64> {
        None
    }
}
