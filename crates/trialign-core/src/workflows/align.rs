use crate::core::geometry::transform::RigidTransform;
use crate::core::models::atom::BackboneKind;
use crate::core::models::molecule::Molecule;
use crate::engine::config::{AlignmentConfig, validate_epsilon};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::search;
use crate::engine::state::BestAlignment;
use nalgebra::Point3;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct AlignmentReport {
    /// Atoms representing each residue in the search.
    pub backbone: BackboneKind,
    pub target_backbone_atoms: usize,
    pub model_backbone_atoms: usize,
    pub target_centroid: Point3<f64>,
    pub model_centroid: Point3<f64>,
    /// Search result, expressed between the centered backbone copies.
    pub best: BestAlignment,
    /// Transform taking the original model coordinates onto the target.
    pub transform: RigidTransform,
    /// Every atom of the model, moved by `transform`.
    pub transformed_model: Molecule,
}

impl AlignmentReport {
    pub fn alignment_size(&self) -> usize {
        self.best.size
    }

    pub fn rmsd(&self) -> f64 {
        self.best.rmsd
    }
}

/// Superposes `model` onto `target`.
///
/// Both molecules are reduced to one backbone atom per residue and centered before
/// the triangle search runs. The resulting transform is then composed with the two
/// centering translations so it applies to the model as read, and the full model
/// is moved by it.
///
/// # Errors
///
/// Returns [`EngineError::Config`] for an unusable distance threshold, and any
/// error raised by the search.
#[instrument(skip_all, name = "alignment_workflow")]
pub fn run(
    target: &Molecule,
    model: &Molecule,
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<AlignmentReport, EngineError> {
    validate_epsilon(config.epsilon)?;

    // === Phase 1: Backbone selection and centering ===
    reporter.report(Progress::PhaseStart {
        name: "Backbone Selection",
    });
    let backbone = config.backbone.resolve(model.first());
    let (target_core, target_centroid) = centered_backbone(target, backbone);
    let (model_core, model_centroid) = centered_backbone(model, backbone);
    info!(
        "Selected {} {} atoms of the target and {} of the model.",
        target_core.len(),
        backbone,
        model_core.len()
    );
    if target_core.is_empty() || model_core.is_empty() {
        warn!("No {} atoms to align in at least one molecule.", backbone);
    }
    reporter.report(Progress::Message(format!(
        "Aligning {} target and {} model {} atoms",
        target_core.len(),
        model_core.len(),
        backbone
    )));
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Triangle search ===
    let best = search::run(&target_core, &model_core, config.epsilon, reporter)?;

    // === Phase 3: Back to the original frame ===
    reporter.report(Progress::PhaseStart {
        name: "Transformation",
    });
    let transform = to_original_frame(&best.transform, &target_centroid, &model_centroid);
    let transformed_model = model.transformed(&transform);
    reporter.report(Progress::PhaseFinish);

    info!(
        size = best.size,
        rmsd = best.rmsd,
        "Alignment finished: {}",
        transform
    );

    Ok(AlignmentReport {
        backbone,
        target_backbone_atoms: target_core.len(),
        model_backbone_atoms: model_core.len(),
        target_centroid,
        model_centroid,
        best,
        transform,
        transformed_model,
    })
}

/// Selects the backbone atoms of `molecule` and moves them so their centroid is at
/// the origin. An empty selection keeps the origin as its centroid.
fn centered_backbone(molecule: &Molecule, backbone: BackboneKind) -> (Molecule, Point3<f64>) {
    let mut selected = molecule.select(|atom| backbone.matches(atom));
    let centroid = selected.centroid().unwrap_or_else(Point3::origin);
    selected += -centroid.coords;
    (selected, centroid)
}

/// Lifts a transform between centered copies to the original coordinates:
/// first undo the model centering, then apply `core`, then redo the target centering.
fn to_original_frame(
    core: &RigidTransform,
    target_centroid: &Point3<f64>,
    model_centroid: &Point3<f64>,
) -> RigidTransform {
    let into_model_frame = RigidTransform::from_translation(-model_centroid.coords);
    let into_target_frame = RigidTransform::from_translation(target_centroid.coords);
    into_target_frame * *core * into_model_frame
}
