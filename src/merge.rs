use crate::Document;
use crate::line::Line;
use crate::section::Section;

impl Document {
    /// Folds `documents` left to right into a new document.
    ///
    /// Sections and keys are the union of all inputs. A later scalar value replaces an earlier one
    /// in place; a later array (`key[]=...` lines) replaces the whole accumulated array. The
    /// inputs are left untouched. The result uses the line break of the first document.
    pub fn merge<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut merged: Option<Self> = None;
        let mut count = 0_usize;

        for document in documents {
            let result = merged.get_or_insert_with(|| Self::with_line_break(document.line_break));

            merge_lines(&document.globals, &mut result.globals);

            for section in &document.sections {
                let target = match result.section_position(section.name()) {
                    Some(i) => &mut result.sections[i],
                    None => match section.name() {
                        Some(name) => result.add_section(name),
                        None => {
                            result.sections.push(Section::new());
                            let last = result.sections.len() - 1;
                            &mut result.sections[last]
                        }
                    },
                };
                merge_lines(section, target);
            }

            count += 1;
            tracing::debug!(
                document = count,
                sections = document.sections.len(),
                "merged document"
            );
        }

        merged.unwrap_or_default()
    }

    fn section_position(&self, name: Option<&str>) -> Option<usize> {
        self.sections.iter().position(|section| section.name() == name)
    }
}

fn merge_lines(source: &Section, target: &mut Section) {
    let mut array_keys = Vec::<&str>::new();

    for line in source.lines() {
        if line.is_blank() || line.is_header() {
            continue;
        }

        // Arrays are written once the whole section has been seen.
        if let Some(base) = line.key().and_then(|key| key.strip_suffix("[]")) {
            if !array_keys.contains(&base) {
                array_keys.push(base);
            }
            continue;
        }

        match line.key().and_then(|key| target.line_mut(key)) {
            Some(existing) => {
                existing.set_text(line.text());
            }
            None => {
                target.push(Line::clone(line));
            }
        }
    }

    for key in array_keys {
        target.set_array(key, source.array(key).into_iter().cloned());
    }
}
