//! Test utilities for building temporary projects on disk.
//!
//! This module is only compiled with the `test-utils` feature.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary project directory.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Write many files at once.
    pub fn add_files(&self, files: &[(&str, &str)]) {
        for (path, content) in files {
            self.add_file(path, content);
        }
    }

    /// A small Next.js-style app with components, hooks, and an API route.
    pub fn sample_app() -> Self {
        let repo = Self::new();
        repo.add_files(&[
            (
                "app/page.tsx",
                "import { Button } from '@/components/Button'\nimport { useCounter } from '../hooks/useCounter'\n\nexport default function Page() {\n  const n = useCounter()\n  return <main><Button label={n} /></main>\n}\n",
            ),
            (
                "app/layout.tsx",
                "import './globals.css'\n\nexport default function RootLayout({ children }) {\n  return <html><body>{children}</body></html>\n}\n",
            ),
            ("app/globals.css", "body { margin: 0; }\n"),
            (
                "app/api/users/route.ts",
                "import { db } from '@/lib/db'\n\nexport async function GET() {\n  return Response.json(await db.users())\n}\n",
            ),
            (
                "components/Button.tsx",
                "import { cn } from '@/lib/utils'\n\nexport function Button({ label }) {\n  if (!label) return null\n  return <button className={cn('btn')}>{label}</button>\n}\n",
            ),
            (
                "hooks/useCounter.ts",
                "import { useState, useEffect } from 'react'\n\nexport function useCounter() {\n  const [n, setN] = useState(0)\n  useEffect(() => setN(1), [])\n  return n\n}\n",
            ),
            (
                "lib/utils.ts",
                "export const cn = (...parts) => parts.join(' ')\n",
            ),
            (
                "lib/db.ts",
                "export const db = { users: async () => [] }\n",
            ),
            ("package.json", "{ \"name\": \"sample\" }\n"),
            ("node_modules/react/index.js", "module.exports = {}\n"),
        ]);
        repo
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
