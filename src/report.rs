//! Plain-text rendering of annotation results.

use std::io::{self, Write};

use itertools::Itertools;

use crate::client::LabeledImage;
use crate::model::{BoundingPoly, EntityAnnotation, FaceAnnotation};

pub fn write_labels(out: &mut impl Write, labels: &[EntityAnnotation]) -> io::Result<()> {
    writeln!(out, "Labels:")?;
    for label in labels {
        writeln!(out, "{}", label.description)?;
        writeln!(out, "\t {}", entity_details(label))?;
    }
    Ok(())
}

pub fn write_texts(out: &mut impl Write, texts: &[EntityAnnotation]) -> io::Result<()> {
    writeln!(out, "Texts:")?;
    for text in texts {
        writeln!(out, "{}", text.description)?;
        writeln!(out, "\t {}", entity_details(text))?;
    }
    Ok(())
}

pub fn write_faces(out: &mut impl Write, faces: &[FaceAnnotation]) -> io::Result<()> {
    writeln!(out, "Faces: {}", faces.len())?;
    for (index, face) in faces.iter().enumerate() {
        writeln!(out, "Index number: {index}\t {}", face_details(face))?;
    }
    Ok(())
}

pub fn write_batch(out: &mut impl Write, results: &[LabeledImage]) -> io::Result<()> {
    writeln!(out, "Batch results")?;
    for result in results {
        writeln!(out)?;
        writeln!(out, "{}", result.name)?;
        for label in &result.labels {
            writeln!(out, " {} ({:.3})", label.description, label.score)?;
        }
    }
    Ok(())
}

fn entity_details(entity: &EntityAnnotation) -> String {
    let mut fields = Vec::new();
    if let Some(mid) = &entity.mid {
        fields.push(format!("mid: {mid}"));
    }
    if let Some(locale) = &entity.locale {
        fields.push(format!("locale: {locale}"));
    }
    if entity.score > 0.0 {
        fields.push(format!("score: {:.3}", entity.score));
    }
    if entity.topicality > 0.0 {
        fields.push(format!("topicality: {:.3}", entity.topicality));
    }
    if let Some(poly) = &entity.bounding_poly {
        fields.push(format!("bounds: {}", vertices(poly)));
    }
    fields.join(", ")
}

fn face_details(face: &FaceAnnotation) -> String {
    let mut details = format!(
        concat!(
            "confidence: {:.3}, roll: {:.1}, pan: {:.1}, tilt: {:.1}, ",
            "joy: {:?}, sorrow: {:?}, anger: {:?}, surprise: {:?}, headwear: {:?}",
        ),
        face.detection_confidence,
        face.roll_angle,
        face.pan_angle,
        face.tilt_angle,
        face.joy_likelihood,
        face.sorrow_likelihood,
        face.anger_likelihood,
        face.surprise_likelihood,
        face.headwear_likelihood,
    );
    if let Some(poly) = &face.bounding_poly {
        details.push_str(&format!(", bounds: {}", vertices(poly)));
    }
    details
}

fn vertices(poly: &BoundingPoly) -> String {
    poly.vertices
        .iter()
        .map(|v| format!("({},{})", v.x, v.y))
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Likelihood, Vertex};

    fn render(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn entity(description: &str) -> EntityAnnotation {
        EntityAnnotation {
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn labels_print_one_entry_per_annotation_in_order() {
        let labels = vec![
            EntityAnnotation {
                mid: Some("/m/0bt9lr".to_string()),
                score: 0.97,
                topicality: 0.97,
                ..entity("Dog")
            },
            entity("Mammal"),
            entity("Grass"),
        ];

        let text = render(|out| write_labels(out, &labels));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Labels:");
        assert_eq!(lines.len(), 1 + 2 * labels.len());
        assert_eq!(lines[1], "Dog");
        assert_eq!(lines[2], "\t mid: /m/0bt9lr, score: 0.970, topicality: 0.970");
        assert_eq!(lines[3], "Mammal");
        assert_eq!(lines[5], "Grass");
    }

    #[test]
    fn texts_include_bounds() {
        let texts = vec![EntityAnnotation {
            locale: Some("en".to_string()),
            bounding_poly: Some(BoundingPoly {
                vertices: vec![Vertex { x: 1, y: 2 }, Vertex { x: 30, y: 2 }],
            }),
            ..entity("STOP")
        }];

        let text = render(|out| write_texts(out, &texts));
        assert_eq!(text, "Texts:\nSTOP\n\t locale: en, bounds: (1,2) (30,2)\n");
    }

    #[test]
    fn empty_results_print_only_the_header() {
        assert_eq!(render(|out| write_labels(out, &[])), "Labels:\n");
        assert_eq!(render(|out| write_faces(out, &[])), "Faces: 0\n");
    }

    #[test]
    fn faces_print_index_labels_in_order() {
        let faces = vec![FaceAnnotation::default(); 25];

        let text = render(|out| write_faces(out, &faces));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Faces: 25");
        assert_eq!(lines.len(), 26);
        for (index, line) in lines[1..].iter().enumerate() {
            assert!(line.starts_with(&format!("Index number: {index}\t")), "{line}");
        }
    }

    #[test]
    fn face_details_show_likelihoods() {
        let face = FaceAnnotation {
            detection_confidence: 0.9,
            joy_likelihood: Likelihood::VeryLikely,
            ..Default::default()
        };

        let text = render(|out| write_faces(out, &[face]));
        assert!(text.contains("confidence: 0.900"));
        assert!(text.contains("joy: VeryLikely"));
        assert!(text.contains("anger: Unknown"));
    }

    #[test]
    fn batch_groups_labels_under_file_names() {
        let results = vec![
            LabeledImage {
                name: "a.jpg".to_string(),
                labels: vec![EntityAnnotation { score: 0.5, ..entity("apple") }],
            },
            LabeledImage {
                name: "b.jpg".to_string(),
                labels: vec![],
            },
            LabeledImage {
                name: "c.jpg".to_string(),
                labels: vec![entity("car"), entity("road")],
            },
        ];

        let text = render(|out| write_batch(out, &results));
        assert_eq!(
            text,
            concat!(
                "Batch results\n\na.jpg\n apple (0.500)\n",
                "\nb.jpg\n",
                "\nc.jpg\n car (0.000)\n road (0.000)\n",
            )
        );
    }
}
