//! Shared fixtures for the adapter benchmarks.

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, file: TestFile) -> Self {
        Self { name, group, file }
    }

    pub fn small(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Small, file)
    }

    pub fn large(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Large, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }
}

/// A response head fixture, with `\n` line endings as stored on disk.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// The head with `\r\n` line endings, as it arrives on the wire.
    pub fn wire_content(&self) -> String {
        self.content.replace('\n', "\r\n")
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Large,
}

pub static SMALL_RESPONSE: TestFile = TestFile::new("small.txt", include_str!("../resources/response/small.txt"));
pub static LARGE_RESPONSE: TestFile = TestFile::new("large.txt", include_str!("../resources/response/large.txt"));

pub fn response_cases() -> Vec<TestCase> {
    vec![TestCase::small("small_response_head", SMALL_RESPONSE), TestCase::large("large_response_head", LARGE_RESPONSE)]
}
