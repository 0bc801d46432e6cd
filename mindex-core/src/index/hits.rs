//! Query-time hit collection

use super::{BucketMap, IndexError, IndexResult, MinimizerIndex};
use crate::seed::Minimizer;
use crate::types::{MinimizerHit, QUERY_MASK_NONE};

impl<M: BucketMap> MinimizerIndex<M> {
    /// Look up every minimizer of `query` and report the indexed seeds it
    /// matches.
    ///
    /// Hits come out in query minimizer order, grouped per minimizer. Keys
    /// occurring more often than the occurrence cutoff are skipped. Hits on
    /// the opposite strand carry the target position on the target's reverse
    /// strand and a query position moved to the last base of the window.
    pub fn collect_hits(&self, query: &[u8]) -> IndexResult<Vec<MinimizerHit>> {
        if !self.is_built() {
            return Err(IndexError::NotBuilt);
        }

        let mut query_seeds = Vec::new();
        self.generator.generate(query, 0, &mut query_seeds)?;
        if query_seeds.is_empty() {
            return Ok(Vec::new());
        }

        let scanner = self.generator.scanner();
        let spans = scanner.is_enabled().then(|| {
            let runs = self.generator.valid_runs(query, 0, query.len());
            scanner.span_table(query, &runs, self.params.k)
        });
        let default_span = self.params.k as u32;
        let cutoff = self.occurrence.cutoff;
        let seeds = self.store.as_slice();

        let mut hits = Vec::new();
        let mut skipped_keys = 0usize;
        for &packed in &query_seeds {
            let qmm = Minimizer::unpack(packed);
            let Some(span) = self.hash.span_of(qmm.key) else {
                continue;
            };
            if span.len() > cutoff {
                skipped_keys += 1;
                continue;
            }

            for &indexed in &seeds[span.range()] {
                let tmm = Minimizer::unpack(indexed);
                let is_reverse = qmm.strand != tmm.strand;
                let mut query_pos = qmm.pos;
                let mut target_pos = tmm.pos;

                if is_reverse {
                    let Some(target_len) = self.seq_len(tmm.seq_id) else {
                        log::warn!(
                            "Hit refers to sequence {} which is not in the collection; skipping",
                            tmm.seq_id
                        );
                        continue;
                    };
                    let window_span = spans
                        .as_ref()
                        .and_then(|table| table.get(qmm.pos as usize).copied())
                        .unwrap_or(default_span);
                    target_pos = (target_len as u32).saturating_sub(tmm.pos + 1);
                    query_pos += window_span.saturating_sub(1);
                } else if self.seqs.get(tmm.seq_id).is_none() {
                    log::warn!(
                        "Hit refers to sequence {} which is not in the collection; skipping",
                        tmm.seq_id
                    );
                    continue;
                }

                hits.push(MinimizerHit::new(
                    tmm.seq_id,
                    is_reverse,
                    target_pos,
                    QUERY_MASK_NONE,
                    query_pos,
                ));
            }
        }

        log::trace!(
            "Query of {} bp: {} minimizers, {} repetitive keys skipped, {} hits",
            query.len(),
            query_seeds.len(),
            skipped_keys,
            hits.len()
        );
        Ok(hits)
    }
}
