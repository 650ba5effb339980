//! Regroups word timings into subtitle segments bounded by a word count

use crate::error::{ConfigError, Fault, InputError};
use crate::recognition::Recognition;
use crate::types::{Segment, Transcript, Word};
use std::num::NonZeroUsize;

/// Segment regrouping configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segmenter {
    /// Maximum words per output segment
    max_words: NonZeroUsize,
}

impl Segmenter {
    /// Create a segmenter that closes a segment every `max_words` words.
    ///
    /// Fails with [`ConfigError::InvalidMaxWords`] for `0`.
    pub fn new(max_words: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(max_words)
            .map(|max_words| Self { max_words })
            .ok_or(ConfigError::InvalidMaxWords(max_words))
    }

    pub fn max_words(&self) -> usize {
        self.max_words.get()
    }

    /// Regroup a chronological word sequence into segments of at most
    /// `max_words` words.
    ///
    /// Each segment spans from its first word's start to its last word's end.
    /// The trailing group is kept even when it is short.
    ///
    /// Words must be ordered by start, as [`Recognition`] guarantees. A group
    /// whose last word ends before its first word starts fails with
    /// [`Fault::EndBeforeStart`].
    pub fn regroup(&self, words: &[Word]) -> Result<Vec<Segment>, Fault> {
        words
            .chunks(self.max_words.get())
            .map(merge_words)
            .collect()
    }

    /// Regroup every recognized segment that carries word timings.
    ///
    /// Groups never cross a recognizer segment boundary. Segments without word
    /// timings pass through unchanged; segments whose words were all blank
    /// are dropped.
    pub fn regroup_recognition(&self, recognition: Recognition) -> Result<Transcript, InputError> {
        let source_count = recognition.segments.len();
        let mut segments = Vec::with_capacity(source_count);

        for (index, recognized) in recognition.segments.into_iter().enumerate() {
            match recognized.words {
                Some(words) => {
                    let regrouped = self
                        .regroup(&words)
                        .map_err(|fault| InputError::MalformedSegment { index, fault })?;
                    segments.extend(regrouped);
                }
                None => segments.push(recognized.segment),
            }
        }

        tracing::debug!(
            max_words = self.max_words.get(),
            source = source_count,
            regrouped = segments.len(),
            "regrouped segments"
        );

        Ok(Transcript::new(segments, recognition.language))
    }
}

/// Merge consecutive words into a single segment
///
/// Text is every word trimmed and joined with a single space.
fn merge_words(words: &[Word]) -> Result<Segment, Fault> {
    let (first, last) = match words {
        [single] => (single, single),
        [first, .., last] => (first, last),
        [] => unreachable!("chunks never yields an empty slice"),
    };

    let text = words
        .iter()
        .map(|w| w.text().trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Segment::new(first.start(), last.end(), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::RecognizedSegment;

    fn word(start: f64, end: f64, text: &str) -> Word {
        Word::new(start, end, text).unwrap()
    }

    fn words(n: usize) -> Vec<Word> {
        (0..n)
            .map(|i| word(i as f64 * 0.5, i as f64 * 0.5 + 0.4, &format!(" w{i}")))
            .collect()
    }

    #[test]
    fn rejects_zero_max_words() {
        assert!(matches!(
            Segmenter::new(0),
            Err(ConfigError::InvalidMaxWords(0))
        ));
    }

    #[test]
    fn regroups_simple_sentence() {
        let segmenter = Segmenter::new(2).unwrap();
        let words = vec![
            word(0.0, 0.4, "Hello"),
            word(0.4, 0.9, "world"),
            word(0.9, 1.5, "today"),
        ];

        let result = segmenter.regroup(&words).unwrap();

        match &result[..] {
            [first, second] => {
                assert_eq!(first.text(), "Hello world");
                assert_eq!(first.start(), 0.0);
                assert_eq!(first.end(), 0.9);
                assert_eq!(second.text(), "today");
                assert_eq!(second.start(), 0.9);
                assert_eq!(second.end(), 1.5);
            }
            _ => panic!("expected 2 segments, got {}", result.len()),
        }
    }

    #[test]
    fn handles_empty_words() {
        let segmenter = Segmenter::new(3).unwrap();
        let result = segmenter.regroup(&[]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn segment_count_is_ceiling_of_word_count() {
        for n in 1..=12 {
            for m in 1..=5 {
                let segmenter = Segmenter::new(m).unwrap();
                let result = segmenter.regroup(&words(n)).unwrap();

                assert_eq!(result.len(), n.div_ceil(m), "n={n} m={m}");

                let last_words = result.last().unwrap().text().split(' ').count();
                let expected = if n % m == 0 { m } else { n % m };
                assert_eq!(last_words, expected, "n={n} m={m}");
            }
        }
    }

    #[test]
    fn covers_every_word_once_in_order() {
        let input = words(7);
        let segmenter = Segmenter::new(3).unwrap();

        let result = segmenter.regroup(&input).unwrap();

        let output: Vec<&str> = result.iter().flat_map(|s| s.text().split(' ')).collect();
        let expected: Vec<&str> = input.iter().map(|w| w.text().trim()).collect();
        assert_eq!(output, expected);
    }

    #[test]
    fn takes_times_from_boundary_words() {
        let input = words(5);
        let segmenter = Segmenter::new(2).unwrap();

        let result = segmenter.regroup(&input).unwrap();

        for (segment, group) in result.iter().zip(input.chunks(2)) {
            assert_eq!(segment.start(), group[0].start());
            assert_eq!(segment.end(), group[group.len() - 1].end());
        }
    }

    #[test]
    fn one_word_per_segment() {
        let segmenter = Segmenter::new(1).unwrap();
        let result = segmenter.regroup(&[word(1.0, 1.2, " only")]).unwrap();

        match &result[..] {
            [single] => assert_eq!(single.text(), "only"),
            _ => panic!("expected 1 segment, got {}", result.len()),
        }
    }

    #[test]
    fn keeps_zero_duration_words() {
        let segmenter = Segmenter::new(5).unwrap();
        let words = vec![word(1.0, 1.0, " um"), word(1.0, 1.0, ","), word(1.0, 1.6, " so")];

        let result = segmenter.regroup(&words).unwrap();

        match &result[..] {
            [single] => {
                assert_eq!(single.text(), "um , so");
                assert_eq!(single.start(), 1.0);
                assert_eq!(single.end(), 1.6);
            }
            _ => panic!("expected 1 segment, got {}", result.len()),
        }
    }

    #[test]
    fn joins_words_with_leading_spaces() {
        let segmenter = Segmenter::new(4).unwrap();
        let words = vec![
            word(0.0, 0.2, " Nice"),
            word(0.2, 0.4, "  to"),
            word(0.4, 0.6, " meet"),
            word(0.6, 0.8, " you."),
        ];

        let result = segmenter.regroup(&words).unwrap();

        assert_eq!(result[0].text(), "Nice to meet you.");
    }

    #[test]
    fn regroups_per_recognized_segment() {
        let segmenter = Segmenter::new(2).unwrap();
        let recognition = Recognition {
            language: Some("en".to_string()),
            segments: vec![
                RecognizedSegment {
                    segment: Segment::new(0.0, 1.5, "Hello world today").unwrap(),
                    words: Some(vec![
                        word(0.0, 0.4, " Hello"),
                        word(0.4, 0.9, " world"),
                        word(0.9, 1.5, " today"),
                    ]),
                },
                RecognizedSegment {
                    segment: Segment::new(2.0, 3.0, "No words here").unwrap(),
                    words: None,
                },
                RecognizedSegment {
                    segment: Segment::new(3.0, 3.5, "Bye").unwrap(),
                    words: Some(vec![word(3.0, 3.5, " Bye")]),
                },
            ],
        };

        let transcript = segmenter.regroup_recognition(recognition).unwrap();

        let texts: Vec<&str> = transcript.segments().iter().map(Segment::text).collect();
        assert_eq!(texts, ["Hello world", "today", "No words here", "Bye"]);
        assert_eq!(transcript.language(), Some("en"));
    }

    #[test]
    fn rejects_groups_ending_before_they_start() {
        let segmenter = Segmenter::new(2).unwrap();
        let words = vec![word(2.0, 2.5, "late"), word(0.0, 0.5, "early")];

        let result = segmenter.regroup(&words);

        assert_eq!(result, Err(Fault::EndBeforeStart { start: 2.0, end: 0.5 }));
    }

    #[test]
    fn reports_source_segment_of_unordered_words() {
        let segmenter = Segmenter::new(3).unwrap();
        let recognition = Recognition {
            language: None,
            segments: vec![
                RecognizedSegment {
                    segment: Segment::new(0.0, 1.0, "fine").unwrap(),
                    words: None,
                },
                RecognizedSegment {
                    segment: Segment::new(1.0, 3.0, "b a").unwrap(),
                    words: Some(vec![word(2.0, 3.0, "b"), word(1.0, 1.5, "a")]),
                },
            ],
        };

        let err = segmenter.regroup_recognition(recognition).unwrap_err();

        assert!(matches!(
            err,
            InputError::MalformedSegment {
                index: 1,
                fault: Fault::EndBeforeStart { .. }
            }
        ));
    }

    #[test]
    fn drops_segments_whose_words_were_all_blank() {
        let segmenter = Segmenter::new(2).unwrap();
        let json = r#"{"segments": [
            {"start": 0.0, "end": 1.0, "text": "...", "words": [{"start": 0.0, "end": 1.0, "word": " "}]},
            {"start": 1.0, "end": 2.0, "text": "kept", "words": [{"start": 1.0, "end": 2.0, "word": " kept"}]}
        ]}"#;

        let recognition = Recognition::from_json(json).unwrap();
        let transcript = segmenter.regroup_recognition(recognition).unwrap();

        match transcript.segments() {
            [single] => assert_eq!(single.text(), "kept"),
            other => panic!("expected 1 segment, got {}", other.len()),
        }
    }
}
