//! 报告上传：解析 multipart 表单并把 PDF 写入上传目录
//!
//! 文本字段：title、type、domain、companyOrGuide；文件字段：report。
//! 任一校验失败都会删除已写入的部分文件。

use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::UploadConfig;
use crate::errors::{Result, TrackerError};
use crate::models::submissions::requests::UploadSubmissionForm;
use crate::utils::{file_magic::PDF_MAGIC, is_pdf, stored_file_name};

/// 文本字段的最大字节数
const MAX_TEXT_FIELD: usize = 4 * 1024;
const REPORT_FIELD: &str = "report";

/// 已落盘的报告
#[derive(Debug)]
pub struct ReceivedReport {
    pub stored_name: String,
    pub path: PathBuf,
    pub size: usize,
}

impl ReceivedReport {
    /// 对外暴露的访问路径
    pub fn public_path(&self) -> String {
        format!("/uploads/{}", self.stored_name)
    }

    /// 尽力删除（记录写入失败时调用）
    pub fn discard(&self) {
        discard_file(&self.path);
    }
}

#[derive(Debug)]
pub struct UploadedForm {
    pub form: UploadSubmissionForm,
    pub report: Option<ReceivedReport>,
}

fn discard_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!("Failed to remove upload {}: {}", path.display(), e);
    }
}

pub async fn receive_submission_form(
    mut payload: Multipart,
    config: &UploadConfig,
) -> Result<UploadedForm> {
    // 确保上传目录存在
    let upload_dir = Path::new(&config.dir);
    if !upload_dir.exists() {
        fs::create_dir_all(upload_dir).map_err(|e| {
            TrackerError::file_operation(format!("Failed to create upload directory: {e}"))
        })?;
    }

    let mut form = UploadSubmissionForm::default();
    let mut report: Option<ReceivedReport> = None;

    loop {
        let next = match payload.try_next().await {
            Ok(next) => next,
            Err(e) => {
                if let Some(r) = &report {
                    r.discard();
                }
                return Err(TrackerError::invalid_input(format!("Invalid multipart payload: {e}")));
            }
        };
        let Some(mut field) = next else { break };

        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name == REPORT_FIELD {
            if report.is_some() {
                if let Some(r) = &report {
                    r.discard();
                }
                return Err(TrackerError::invalid_input(
                    "Only one report file can be uploaded",
                ));
            }

            let original_name = content_disposition
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string())
                .unwrap_or_default();

            // 声明的类型必须是 PDF
            let is_pdf_type = field
                .content_type()
                .map(|ct| ct.essence_str() == "application/pdf")
                .unwrap_or(false);
            if !is_pdf_type {
                return Err(TrackerError::invalid_input("Only PDF files are allowed"));
            }

            let received = write_report(&mut field, &original_name, upload_dir, config.max_size).await?;
            report = Some(received);
        } else {
            match read_text_field(&mut field).await {
                Ok(value) => match name.as_str() {
                    "title" => form.title = Some(value),
                    "type" => form.submission_type = Some(value),
                    "domain" => form.domain = Some(value),
                    "companyOrGuide" => form.company_or_guide = Some(value),
                    // 其余字段（含 studentId）一律忽略
                    _ => {}
                },
                Err(e) => {
                    if let Some(r) = &report {
                        r.discard();
                    }
                    return Err(e);
                }
            }
        }
    }

    Ok(UploadedForm { form, report })
}

async fn read_text_field(field: &mut actix_multipart::Field) -> Result<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let data =
            chunk.map_err(|e| TrackerError::invalid_input(format!("Invalid form field: {e}")))?;
        if buf.len() + data.len() > MAX_TEXT_FIELD {
            return Err(TrackerError::invalid_input("Form field too large"));
        }
        buf.extend_from_slice(&data);
    }
    String::from_utf8(buf).map_err(|_| TrackerError::invalid_input("Form field must be UTF-8"))
}

async fn write_report(
    field: &mut actix_multipart::Field,
    original_name: &str,
    upload_dir: &Path,
    max_size: usize,
) -> Result<ReceivedReport> {
    let stored_name = stored_file_name(original_name);
    let path = upload_dir.join(&stored_name);
    let mut f = File::create(&path)
        .map_err(|e| TrackerError::file_operation(format!("Failed to create file: {e}")))?;

    let mut total_size: usize = 0;
    // 魔术字节可能跨 chunk，先攒够再判断
    let mut head: Vec<u8> = Vec::with_capacity(PDF_MAGIC.len());
    let mut verified = false;

    while let Some(chunk) = field.next().await {
        let data = match chunk {
            Ok(data) => data,
            Err(e) => {
                discard_file(&path);
                return Err(TrackerError::invalid_input(format!("Upload interrupted: {e}")));
            }
        };

        if !verified {
            let need = PDF_MAGIC.len() - head.len();
            head.extend_from_slice(&data[..need.min(data.len())]);
            if head.len() == PDF_MAGIC.len() {
                if !is_pdf(&head) {
                    discard_file(&path);
                    return Err(TrackerError::invalid_input("File is not a valid PDF"));
                }
                verified = true;
            }
        }

        total_size += data.len();
        // 校验大小
        if total_size > max_size {
            discard_file(&path);
            return Err(TrackerError::invalid_input(format!(
                "File size exceeds the limit of {max_size} bytes"
            )));
        }

        if let Err(e) = f.write_all(&data) {
            discard_file(&path);
            return Err(TrackerError::file_operation(format!("Failed to write file: {e}")));
        }
    }

    if !verified {
        discard_file(&path);
        return Err(TrackerError::invalid_input("File is not a valid PDF"));
    }

    Ok(ReceivedReport {
        stored_name,
        path,
        size: total_size,
    })
}
