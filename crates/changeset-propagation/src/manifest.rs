use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Manifest {
    pub(crate) package: Option<Section>,
    pub(crate) workspace: Option<Section>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Section {
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Metadata {
    pub(crate) changeset: Option<ChangesetMetadata>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct ChangesetMetadata {
    #[serde(default)]
    pub(crate) ignore: Vec<String>,
}

impl Manifest {
    /// The `[workspace.metadata.changeset]` table, falling back to `[package.metadata.changeset]`.
    pub(crate) fn into_changeset_metadata(self) -> Option<ChangesetMetadata> {
        let from_section =
            |section: Option<Section>| section.and_then(|s| s.metadata).and_then(|m| m.changeset);

        from_section(self.workspace).or_else(|| from_section(self.package))
    }
}
