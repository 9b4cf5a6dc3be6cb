use log::error;
use thiserror::Error;

use crate::{cfg::SolverOpts, navigation::dop::DilutionOfPrecision};

/// Reasons for which a formed solution is not published
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InvalidationCause {
    /// Dilution of precision could not be resolved, or is not physical
    #[error("untrustworthy geometry")]
    UntrustworthyGeometry,
    #[error("gdop limit exceeded {0}")]
    GDOPOutlier(f64),
    #[error("tdop limit exceeded {0}")]
    TDOPOutlier(f64),
}

pub(crate) struct SolutionValidator {
    dop: Option<DilutionOfPrecision>,
}

impl SolutionValidator {
    pub fn new(dop: Option<DilutionOfPrecision>) -> Self {
        Self { dop }
    }

    /*
     * Solution validation process
     */
    pub fn validate(&self, opts: &SolverOpts) -> Result<DilutionOfPrecision, InvalidationCause> {
        let dop = self.dop.ok_or(InvalidationCause::UntrustworthyGeometry)?;

        if let Some(max_gdop) = opts.gdop_threshold {
            if dop.gdop > max_gdop {
                error!("gdop={:.3} exceeds {:.3}", dop.gdop, max_gdop);
                return Err(InvalidationCause::GDOPOutlier(dop.gdop));
            }
        }

        if let Some(max_tdop) = opts.tdop_threshold {
            if dop.tdop > max_tdop {
                error!("tdop={:.3} exceeds {:.3}", dop.tdop, max_tdop);
                return Err(InvalidationCause::TDOPOutlier(dop.tdop));
            }
        }

        Ok(dop)
    }
}
